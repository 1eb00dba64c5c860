//! The storage file.
use super::converter_attributes;
use crate::block::{Record, component_file_records, write_file};
use crate::derive::{StorageParameters, derive_storage};
use crate::storage::Storage;
use crate::year::Timestamp;
use anyhow::Result;
use std::path::Path;

/// The name of the storage file
pub const STORAGE_FILE_NAME: &str = "Storage.csv";

/// The heading of the storage file
const TITLE: &str = "storage-technologies";

/// The block for a storage. Its only port is the one shared with its converter.
pub fn storage_block(params: &StorageParameters, start: &Timestamp) -> Vec<Record> {
    let port = [&params.energy_port];
    let mut block = vec![
        Record::header(&params.storage.code)
            .with_list("#input", &port)
            .with_list("#output", &port),
    ];
    block.extend(converter_attributes(&params.storage, start));
    block.push(Record::end_block());
    block
}

/// All records of the storage file
pub fn storage_file_records(storages: &[Storage], start: &Timestamp) -> Vec<Record> {
    let blocks = storages
        .iter()
        .map(|storage| storage_block(&derive_storage(storage), start))
        .collect();

    component_file_records(TITLE, blocks)
}

/// Write the storage file to `dir`
pub fn write_storage_file(dir: &Path, storages: &[Storage], start: &Timestamp) -> Result<()> {
    write_file(
        &dir.join(STORAGE_FILE_NAME),
        &storage_file_records(storages, start),
    )
}
