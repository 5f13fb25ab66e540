//! Serviços
//!
//! Lógica de negócio sem HTTP: IDs, sequencial, fotos e os artefatos
//! gerados (etiqueta PNG, QR code e PDF de impressão).

pub mod fonts;
pub mod id_generator;
pub mod label_composer;
pub mod print_composer;
pub mod qr_encoder;
pub mod sequence;
pub mod upload_storage;

pub use id_generator::{Clock, IdAllocator, NamespaceLocks, SystemClock};
pub use upload_storage::UploadStorage;
