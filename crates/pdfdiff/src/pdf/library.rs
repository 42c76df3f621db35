use pdfium_render::prelude::*;
use tracing::debug;

use crate::error::{Error, Result};

/// Directory holding the PDFium shared library, checked before `./`.
const ENV_PDFIUM_PATH: &str = "PDFDIFF_PDFIUM_PATH";

/// Bind to the PDFium shared library.
///
/// Searches, in order:
/// 1. `$PDFDIFF_PDFIUM_PATH`
/// 2. Current directory
/// 3. System library paths
pub fn bind_pdfium() -> Result<Pdfium> {
    let env_dir = std::env::var(ENV_PDFIUM_PATH).ok();
    let local = || Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path("./"));

    let bindings = match &env_dir {
        Some(dir) => Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path(dir))
            .or_else(|_| local()),
        None => local(),
    }
    .or_else(|_| Pdfium::bind_to_system_library())
    .map_err(|e| Error::Library(format!("{e:?}")))?;

    debug!(env_dir = ?env_dir, "bound pdfium library");
    Ok(Pdfium::new(bindings))
}
