#[cfg(test)]
mod common;

#[cfg(test)]
mod auth_tests;

#[cfg(test)]
mod family_office_tests;

#[cfg(test)]
mod family_tests;

#[cfg(test)]
mod document_tests;

#[cfg(test)]
mod meeting_tests;

#[cfg(test)]
mod message_tests;
