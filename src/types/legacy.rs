use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// A Zimbra folder as reported by the server
///
/// Immutable snapshot of server state at fetch time. The same shape covers
/// both address book folders (view `contact`) and calendar folders
/// (view `appointment`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZimbraFolder {
    /// Server-assigned folder identifier (opaque)
    pub folder_id: String,

    /// Display name of the folder
    pub name: String,

    /// Absolute slash-delimited path, rooted at a well-known folder
    /// such as `/Contacts` or `/Calendar`
    pub abs_folder_path: String,
}

/// A Zimbra contact with its raw attribute bag
///
/// Attributes follow Zimbra's positional-suffix convention (`email`,
/// `email2`, `workEmail2`, ...). Unrecognized attribute names pass through
/// untouched and are never interpreted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZimbraContact {
    /// Server-assigned contact identifier
    pub contact_id: String,

    /// Identifier of the folder holding this contact
    pub folder_id: String,

    /// Raw attribute name → value mapping
    #[serde(default)]
    pub attrs: HashMap<String, String>,

    /// Group members, in document order; only populated for contacts whose
    /// `type` attribute is `group`
    #[serde(default)]
    pub members: Vec<ZimbraContactGroupMember>,
}

/// A single member of a Zimbra contact group
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZimbraContactGroupMember {
    /// Single-letter member type code: `I` for an inline address literal,
    /// `C`/`G` for contact and GAL references
    pub member_type: String,

    /// Free-text address or reference string, taken verbatim
    pub value: String,
}

impl ZimbraContact {
    /// Look up an attribute value by name
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs.get(name).map(|v| v.as_str())
    }

    /// Whether this contact is a contact group
    pub fn is_group(&self) -> bool {
        self.attr("type") == Some("group")
    }
}
