pub mod db;
pub mod investmentdb;
pub mod referraldb;
pub mod taskdb;
pub mod transactiondb;
pub mod userdb;
