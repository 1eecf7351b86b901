pub mod helpers;

mod token;
