use std::sync::Arc;

use anyhow::Result;
use ollama_db_agent::EmployeeIndexer;
use ollama_db_core::{DbConfig, OllamaConfig};
use ollama_db_embeddings::OllamaEmbeddings;
use ollama_db_storage::PgStorage;

pub(crate) async fn run_index(db: &DbConfig, ollama: &OllamaConfig, collection: &str) -> Result<()> {
    let storage = PgStorage::connect(db).await?;
    storage.migrate().await?;
    let storage = Arc::new(storage);
    let embeddings = Arc::new(OllamaEmbeddings::new(&ollama.base_url, &ollama.embed_model)?);

    let indexer = EmployeeIndexer::new(storage.clone(), storage, embeddings)
        .with_collection(collection);
    let count = indexer.index().await?;
    println!("Indexed {count} employees into collection '{collection}'.");
    Ok(())
}
