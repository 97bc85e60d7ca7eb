pub mod tours;
pub mod transfers;
pub mod users;
