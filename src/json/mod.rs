pub mod scanner;
pub mod normalize;
pub mod tokenizer;
pub mod validator;
pub mod view;
pub mod patch;
pub mod pretty;
