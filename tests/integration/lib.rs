#![cfg(test)]

mod common;

mod test_confirmation;
mod test_create_account;
mod test_declare_and_deploy;
mod test_invoke;
mod test_transfer;
