pub mod valr;
