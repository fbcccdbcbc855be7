//! External collaborators: embedding service, vector store, and chat API.
//!
//! Each collaborator is a trait so the pipeline can be tested against
//! fakes; the HTTP-backed implementations live alongside their traits.

mod chat_client;
mod embedding_client;
mod vector_store;

pub use chat_client::{ChatModel, OpenAiChatClient};
pub use embedding_client::{Embedder, HttpEmbedder};
pub use vector_store::{HttpVectorStore, VectorStore};
