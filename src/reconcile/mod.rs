pub(crate) mod engine;
pub(crate) mod extract;
pub(crate) mod resolver;
