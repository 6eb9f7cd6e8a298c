pub mod content;
pub mod extractor;
pub mod matcher;
pub mod normalizer;
pub mod recommend;
pub mod vocabulary;
