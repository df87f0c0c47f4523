pub mod investmentmodel;
pub mod referralmodel;
pub mod taskmodel;
pub mod transactionmodel;
pub mod usermodel;
