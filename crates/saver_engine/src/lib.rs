//! Saver engine: page tree, detection and the download IO pipeline.
mod archive;
mod broker;
mod convert;
mod cover;
mod detect;
mod engine;
mod fetch;
mod helper;
mod message;
mod name;
mod orchestrate;
mod page;
mod persist;
mod pipeline;
mod resolve;
mod staging;

pub use archive::{build_archive, deliver_archive, ArchiveEntry, ArchiveError};
pub use broker::{DownloadBroker, BrokerError, HelperHandoff, HELPER_PAGE};
pub use convert::{convert_blob, sniff_mime, ConvertError, JPEG_QUALITY};
pub use cover::{
    compose_cover, parse_data_url, CoverError, CoverImage, DataUrlError, CELL_HEIGHT, CELL_WIDTH,
    GRID_COLS, GRID_ROWS,
};
pub use detect::{GridDetector, ANCHOR_TEXT, CONTROL_TEXT, MARKER_CLASS};
pub use engine::{EngineEvent, EngineHandle};
pub use fetch::{Blob, FetchError, FetchSettings, Fetcher, ReqwestFetcher};
pub use helper::{HelperError, HelperSession};
pub use message::{
    CoverPayload, DownloadStyleRequest, ImageEntry, StageResponse, DOWNLOAD_STYLE_ACTION,
};
pub use name::{archive_file_name, cover_name, entry_name, last_path_segment, sanitize};
pub use orchestrate::{DownloadError, DownloadOrchestrator};
pub use page::{ElementData, PageDom, PageNode};
pub use persist::{ensure_output_dir, AtomicFileWriter, PersistError};
pub use pipeline::{process_queue, ItemKind, ItemSource, QueueItem};
pub use resolve::{
    resolve_group, GroupError, StyleGroup, FULL_GRID, GROUP_ROOT_MIN, IMAGE_SRC_PATTERN,
};
pub use staging::{
    generate_staging_key, poll_take, JsonFileStagingStore, MemoryStagingStore, StagingError,
    StagingStore, POLL_INTERVAL, POLL_RETRIES,
};
