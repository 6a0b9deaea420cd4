//! Zimbra SOAP response extraction
//!
//! Structural extraction of typed legacy entities out of Zimbra's SOAP
//! response envelopes. Contacts arrive as `<cn>` nodes carrying their
//! attributes in `<a n="...">` children and (for contact groups) their
//! members in `<m type="..." value="..."/>` children; folders arrive as a
//! nested `<folder>` tree inside `GetFolderResponse`.
//!
//! This layer does not validate attribute semantics. It pulls the document
//! structure into typed values and leaves interpretation to the builders.

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use tracing::debug;

use crate::error::{MigrateError, Result};
use crate::types::{ZimbraContact, ZimbraContactGroupMember, ZimbraFolder};

/// Folder view filter for `parse_folders_response`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FolderView {
    /// Address book folders (`view="contact"`)
    Contact,
    /// Calendar folders (`view="appointment"`)
    Appointment,
}

impl FolderView {
    fn as_str(&self) -> &'static str {
        match self {
            Self::Contact => "contact",
            Self::Appointment => "appointment",
        }
    }
}

/// Parse a `GetContactsResponse` envelope into contacts
///
/// Fails with a parse error (and no partial output) when the envelope does
/// not contain a `GetContactsResponse` element.
pub fn parse_contacts_response(xml: &str) -> Result<Vec<ZimbraContact>> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut saw_response = false;
    let mut in_response = false;
    let mut contacts: Vec<ZimbraContact> = Vec::new();
    let mut current: Option<ZimbraContact> = None;
    // Name of the <a n="..."> attribute whose text we are inside
    let mut pending_attr: Option<String> = None;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                let name = local_name(&e);
                if name == "GetContactsResponse" {
                    saw_response = true;
                    in_response = true;
                } else if in_response && name == "cn" {
                    current = Some(contact_from_node(&e));
                } else if name == "a" {
                    if current.is_some() {
                        pending_attr = xml_attr(&e, "n");
                    }
                } else if name == "m" {
                    if let Some(contact) = current.as_mut() {
                        contact.members.push(member_from_node(&e));
                    }
                }
            }
            Ok(Event::Empty(e)) => {
                let name = local_name(&e);
                if in_response && name == "cn" {
                    contacts.push(contact_from_node(&e));
                } else if name == "a" {
                    // An empty attribute element carries an empty value
                    if let (Some(contact), Some(attr)) = (current.as_mut(), xml_attr(&e, "n")) {
                        contact.attrs.insert(attr, String::new());
                    }
                } else if name == "m" {
                    if let Some(contact) = current.as_mut() {
                        contact.members.push(member_from_node(&e));
                    }
                }
            }
            Ok(Event::Text(t)) => {
                if let (Some(contact), Some(attr)) = (current.as_mut(), pending_attr.take()) {
                    let value = t.unescape().unwrap_or_default().to_string();
                    contact.attrs.insert(attr, value);
                }
            }
            Ok(Event::End(e)) => {
                let name = local_name_end(e.name().as_ref());
                if name == "cn" {
                    if let Some(mut contact) = current.take() {
                        // Members only exist on contact groups; drop strays
                        if !contact.is_group() {
                            contact.members.clear();
                        }
                        contacts.push(contact);
                    }
                } else if name == "a" {
                    pending_attr = None;
                } else if name == "GetContactsResponse" {
                    in_response = false;
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(MigrateError::Parse(format!(
                    "Failed to parse contacts response XML: {}",
                    e
                )));
            }
            _ => {}
        }
    }

    if !saw_response {
        return Err(MigrateError::Parse(
            "Response envelope contains no GetContactsResponse element".to_string(),
        ));
    }

    debug!("Parsed {} contacts from GetContactsResponse", contacts.len());
    Ok(contacts)
}

/// Parse a `GetFolderResponse` envelope into folders of the requested view
///
/// The folder tree is flattened; only folders whose `view` attribute matches
/// and that carry an absolute path are returned, in document order.
pub fn parse_folders_response(xml: &str, view: FolderView) -> Result<Vec<ZimbraFolder>> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut saw_response = false;
    let mut in_response = false;
    let mut folders: Vec<ZimbraFolder> = Vec::new();

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) | Ok(Event::Empty(e)) => {
                let name = local_name(&e);
                if name == "GetFolderResponse" {
                    saw_response = true;
                    in_response = true;
                } else if in_response && name == "folder" {
                    if xml_attr(&e, "view").as_deref() == Some(view.as_str()) {
                        if let Some(folder) = folder_from_node(&e) {
                            folders.push(folder);
                        }
                    }
                }
            }
            Ok(Event::End(e)) => {
                if local_name_end(e.name().as_ref()) == "GetFolderResponse" {
                    in_response = false;
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(MigrateError::Parse(format!(
                    "Failed to parse folder response XML: {}",
                    e
                )));
            }
            _ => {}
        }
    }

    if !saw_response {
        return Err(MigrateError::Parse(
            "Response envelope contains no GetFolderResponse element".to_string(),
        ));
    }

    debug!(
        "Parsed {} {} folders from GetFolderResponse",
        folders.len(),
        view.as_str()
    );
    Ok(folders)
}

fn contact_from_node(e: &BytesStart) -> ZimbraContact {
    ZimbraContact {
        contact_id: xml_attr(e, "id").unwrap_or_default(),
        folder_id: xml_attr(e, "l").unwrap_or_default(),
        attrs: Default::default(),
        members: Vec::new(),
    }
}

fn member_from_node(e: &BytesStart) -> ZimbraContactGroupMember {
    ZimbraContactGroupMember {
        member_type: xml_attr(e, "type").unwrap_or_default(),
        value: xml_attr(e, "value").unwrap_or_default(),
    }
}

fn folder_from_node(e: &BytesStart) -> Option<ZimbraFolder> {
    Some(ZimbraFolder {
        folder_id: xml_attr(e, "id")?,
        name: xml_attr(e, "name")?,
        abs_folder_path: xml_attr(e, "absFolderPath")?,
    })
}

/// Element name with any namespace prefix stripped
fn local_name(e: &BytesStart) -> String {
    local_name_end(e.name().as_ref())
}

fn local_name_end(raw: &[u8]) -> String {
    let name = String::from_utf8_lossy(raw);
    match name.rsplit_once(':') {
        Some((_, local)) => local.to_string(),
        None => name.to_string(),
    }
}

/// Read a single attribute value off an element
fn xml_attr(e: &BytesStart, key: &str) -> Option<String> {
    e.try_get_attribute(key)
        .ok()
        .flatten()
        .and_then(|a| a.unescape_value().ok())
        .map(|v| v.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    const CONTACTS_XML: &str = r#"<?xml version="1.0"?>
<soap:Envelope xmlns:soap="http://www.w3.org/2003/05/soap-envelope">
  <soap:Body>
    <GetContactsResponse xmlns="urn:zimbraMail">
      <cn id="261" l="7">
        <a n="firstName">Ada</a>
        <a n="lastName">Lovelace</a>
        <a n="email">ada@example.com</a>
        <a n="workEmail2">ada@work.example.com</a>
      </cn>
      <cn id="262" l="7">
        <a n="nickname">Team</a>
        <a n="type">group</a>
        <m type="I" value="first@example.com"/>
        <m type="C" value="261"/>
        <m type="I" value="&quot;Second&quot; &lt;second@example.com&gt;"/>
      </cn>
    </GetContactsResponse>
  </soap:Body>
</soap:Envelope>"#;

    #[test]
    fn test_parse_contacts() {
        let contacts = parse_contacts_response(CONTACTS_XML).unwrap();
        assert_eq!(contacts.len(), 2);

        let ada = &contacts[0];
        assert_eq!(ada.contact_id, "261");
        assert_eq!(ada.folder_id, "7");
        assert_eq!(ada.attr("firstName"), Some("Ada"));
        assert_eq!(ada.attr("workEmail2"), Some("ada@work.example.com"));
        assert!(!ada.is_group());
        assert!(ada.members.is_empty());
    }

    #[test]
    fn test_parse_group_members_in_order() {
        let contacts = parse_contacts_response(CONTACTS_XML).unwrap();
        let group = &contacts[1];
        assert!(group.is_group());
        assert_eq!(group.members.len(), 3);
        assert_eq!(group.members[0].member_type, "I");
        assert_eq!(group.members[0].value, "first@example.com");
        assert_eq!(group.members[1].member_type, "C");
        assert_eq!(group.members[1].value, "261");
        // Quoted display-name form is taken verbatim
        assert_eq!(group.members[2].value, "\"Second\" <second@example.com>");
    }

    #[test]
    fn test_missing_response_element_fails() {
        let xml = r#"<soap:Envelope xmlns:soap="http://www.w3.org/2003/05/soap-envelope">
  <soap:Body><GetFolderResponse/></soap:Body>
</soap:Envelope>"#;
        let err = parse_contacts_response(xml).unwrap_err();
        assert!(matches!(err, MigrateError::Parse(_)));
    }

    #[test]
    fn test_parse_folders_filters_by_view() {
        let xml = r#"<soap:Envelope xmlns:soap="http://www.w3.org/2003/05/soap-envelope">
  <soap:Body>
    <GetFolderResponse xmlns="urn:zimbraMail">
      <folder id="1" name="USER_ROOT" absFolderPath="/">
        <folder id="7" name="Contacts" absFolderPath="/Contacts" view="contact"/>
        <folder id="10" name="Calendar" absFolderPath="/Calendar" view="appointment">
          <folder id="11" name="Work" absFolderPath="/Calendar/Work" view="appointment"/>
        </folder>
        <folder id="13" name="Emailed Contacts" absFolderPath="/Emailed Contacts" view="contact"/>
      </folder>
    </GetFolderResponse>
  </soap:Body>
</soap:Envelope>"#;

        let contacts = parse_folders_response(xml, FolderView::Contact).unwrap();
        assert_eq!(contacts.len(), 2);
        assert_eq!(contacts[0].name, "Contacts");
        assert_eq!(contacts[1].abs_folder_path, "/Emailed Contacts");

        let calendars = parse_folders_response(xml, FolderView::Appointment).unwrap();
        assert_eq!(calendars.len(), 2);
        assert_eq!(calendars[1].abs_folder_path, "/Calendar/Work");
    }

    #[test]
    fn test_folders_missing_envelope_fails() {
        let err = parse_folders_response("<other/>", FolderView::Contact).unwrap_err();
        assert!(matches!(err, MigrateError::Parse(_)));
    }
}
