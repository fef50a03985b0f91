pub mod create;
pub mod keygen;
pub mod view;
