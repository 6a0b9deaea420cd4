//! Folder path to container name mapping
//!
//! Zimbra reports absolute folder paths rooted at a well-known folder
//! (`/Contacts`, `/Calendar`). On the JMAP side, address books and calendars
//! are flat containers identified by name, so the root segment is stripped
//! and nested paths keep their remaining segments (`Work/Nested`). Folders
//! that *are* the root keep their display name, which also handles
//! root-level defaults like `Emailed Contacts`.

use crate::types::ZimbraFolder;

/// Map a folder's absolute path to a target container name
pub fn container_name(folder: &ZimbraFolder) -> String {
    let remainder = folder
        .abs_folder_path
        .split('/')
        .filter(|s| !s.is_empty())
        .skip(1)
        .collect::<Vec<_>>()
        .join("/");

    if remainder.is_empty() {
        folder.name.clone()
    } else {
        remainder
    }
}

/// Target address book name for a contact folder
pub fn address_book_name(folder: &ZimbraFolder) -> String {
    container_name(folder)
}

/// Target calendar name for a calendar folder
pub fn calendar_name(folder: &ZimbraFolder) -> String {
    container_name(folder)
}
