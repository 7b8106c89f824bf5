mod local_store;

pub use local_store::{
    classify_media, sanitize_file_name, LocalUploadStore, MediaKind, SavedUpload,
    DOCUMENT_EXTENSIONS, IMAGE_EXTENSIONS, VIDEO_EXTENSIONS,
};
