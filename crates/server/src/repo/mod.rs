pub mod documents;
pub mod families;
pub mod family_offices;
pub mod meetings;
pub mod messages;
pub mod users;
