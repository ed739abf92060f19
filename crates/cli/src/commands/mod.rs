pub(crate) mod ask;
pub(crate) mod index;
pub(crate) mod ingest;
