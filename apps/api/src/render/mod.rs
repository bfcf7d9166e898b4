// CV-to-DOCX rendering pipeline.
// helpers: one pure function per content-node kind (RenderStyle in, nodes out).
// assembler: walks validated sections, applies skip and page-break rules.
// docx: serialises the node tree into a WordprocessingML package.

pub mod assembler;
pub mod docx;
pub mod helpers;
pub mod logo;
pub mod model;

use thiserror::Error;

pub use assembler::{generate_cv, layout_cv, CvLayout, RenderedDocument};
pub use logo::{FsLogoLoader, HttpLogoLoader, LogoLoader};

/// Fatal generation failures. A missing logo is never one of them.
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("Invalid template configuration: {0}")]
    Template(String),

    #[error("Document packaging failed: {0}")]
    Package(#[from] zip::result::ZipError),

    #[error("I/O error while writing document: {0}")]
    Io(#[from] std::io::Error),

    #[error("Rendering task failed: {0}")]
    Task(String),
}
