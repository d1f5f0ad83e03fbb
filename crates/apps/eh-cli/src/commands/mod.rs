pub mod publish;
pub mod subscribe;
