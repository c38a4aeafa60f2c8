mod password;
mod token;

pub use self::{
    password::{hash_password, verify_password},
    token::{Claims, TokenKeys},
};
