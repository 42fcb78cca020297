pub mod scope;
pub mod swap;
pub mod token;
pub mod tx_record;
pub mod wallet;
