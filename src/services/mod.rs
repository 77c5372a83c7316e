pub mod archive_store;
pub mod external_tool;
pub mod gazette_page;
pub mod listing;
pub mod ocr;
pub mod rasterizer;

pub use archive_store::ArchiveStore;
pub use gazette_page::GazettePage;
pub use listing::ListingSource;
pub use ocr::{OcrSettings, Tesseract, TextRecognizer};
pub use rasterizer::{Pdftoppm, Rasterizer, DEFAULT_RASTER_DPI};
