use serde::{Deserialize, Serialize};

/// File extension of every roster photo.
pub const PHOTO_EXTENSION: &str = ".jpg";

/// Request payload for the folder-listing endpoint.
#[derive(Debug, Serialize)]
pub struct ListFolderRequest {
    /// Folder to enumerate.
    pub path: String,
}

/// Response payload of the folder-listing endpoint.
#[derive(Debug, Deserialize)]
pub struct ListFolderResponse {
    /// Files found in the folder.
    pub entries: Vec<FolderEntry>,
}

/// One file inside a listed folder.
#[derive(Debug, Deserialize)]
pub struct FolderEntry {
    /// File name including extension.
    pub name: String,
}

/// Request payload for the temporary-link endpoint.
#[derive(Debug, Serialize)]
pub struct TempLinkRequest {
    /// File the link should point at.
    pub path: String,
}

/// Response payload of the temporary-link endpoint.
#[derive(Debug, Deserialize)]
pub struct TempLinkResponse {
    /// Time-limited URL for the file.
    pub link: String,
}

/// Full path of one person's photo inside the game data folder.
pub fn photo_path(game_data_path: &str, folder: &str, name: &str) -> String {
    format!(
        "{}/{}/{}{}",
        game_data_path.trim_end_matches('/'),
        folder,
        name,
        PHOTO_EXTENSION
    )
}

/// Person name derived from a photo file name, when the extension matches.
pub fn person_name(file_name: &str) -> Option<&str> {
    file_name.strip_suffix(PHOTO_EXTENSION)
}
