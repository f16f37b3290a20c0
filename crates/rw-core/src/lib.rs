pub mod catalog;
pub mod clock;
pub mod error;
pub mod generator;
pub mod geo;
pub mod incident;
pub mod map;
pub mod publish;
pub mod temporal;
pub mod window;
