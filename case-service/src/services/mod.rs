pub mod database;
pub mod jwt;
pub mod storage;

pub use database::MongoDb;
pub use jwt::{JwtVerifier, TokenClaims};
pub use storage::{
    PdfFamily, StoredPdf, UploadStore, MAX_CASE_PDF_BYTES, MAX_NOTIFICATION_PDF_BYTES,
};
