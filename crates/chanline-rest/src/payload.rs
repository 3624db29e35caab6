//! Request body encoding for message drafts.
//!
//! A draft without files is sent as a JSON document. A draft with files is
//! sent as `multipart/form-data`: the JSON document goes in a
//! `payload_json` field and every file becomes a part named `file<index>`.

use std::io::{self, Read, Write};

use bytes::Bytes;
use uuid::Uuid;

use crate::error::EncodeError;
use crate::model::ATTACHMENT_SPOILER_PREFIX;
use crate::params::CreateChannelMessageParams;

/// Media type of JSON bodies.
pub const CONTENT_TYPE_JSON: &str = "application/json";

/// Multipart field holding the JSON document.
pub const PAYLOAD_JSON_FIELD: &str = "payload_json";

/// An encoded body with its media type.
#[derive(Debug, Clone)]
pub struct Payload {
    /// Encoded bytes.
    pub body: Bytes,
    /// Value for the `Content-Type` header.
    pub content_type: String,
}

impl CreateChannelMessageParams {
    /// Apply the spoiler directives and encode the draft.
    ///
    /// Attachment readers are drained here. If any of them fails, nothing
    /// of the partially built body is returned.
    pub fn prepare(mut self) -> Result<Payload, EncodeError> {
        self.apply_spoiler_tags();

        if self.files.is_empty() {
            let body = serde_json::to_vec(&self)?;
            return Ok(Payload {
                body: Bytes::from(body),
                content_type: CONTENT_TYPE_JSON.to_string(),
            });
        }

        let json = serde_json::to_string(&self)?;
        let mut mp = MultipartWriter::new();
        mp.write_field(PAYLOAD_JSON_FIELD, &json);

        for (index, file) in self.files.iter_mut().enumerate() {
            mp.write_file(&format!("file{}", index), &file.file_name, &mut file.reader)
                .map_err(|source| EncodeError::Attachment {
                    index,
                    file_name: file.file_name.clone(),
                    source,
                })?;
        }

        tracing::debug!(files = self.files.len(), "encoded multipart message payload");
        Ok(mp.finish())
    }

    fn apply_spoiler_tags(&mut self) {
        if self.spoiler_tag_content && !self.content.is_empty() {
            self.content = format!("|| {} ||", self.content);
        }
        if self.spoiler_tag_all_attachments {
            for file in &mut self.files {
                file.spoiler_tag = true;
            }
        }
        for file in &mut self.files {
            if file.spoiler_tag && !file.file_name.starts_with(ATTACHMENT_SPOILER_PREFIX) {
                file.file_name.insert_str(0, ATTACHMENT_SPOILER_PREFIX);
            }
        }
    }
}

/// Minimal `multipart/form-data` writer over an in-memory buffer.
struct MultipartWriter {
    boundary: String,
    buf: Vec<u8>,
}

impl MultipartWriter {
    fn new() -> Self {
        Self {
            boundary: Uuid::new_v4().simple().to_string(),
            buf: Vec::new(),
        }
    }

    fn write_field(&mut self, name: &str, value: &str) {
        self.open_part(&format!(
            "Content-Disposition: form-data; name=\"{}\"\r\n",
            escape_quotes(name)
        ));
        self.buf.extend_from_slice(value.as_bytes());
        self.buf.extend_from_slice(b"\r\n");
    }

    fn write_file(&mut self, name: &str, file_name: &str, reader: &mut dyn Read) -> io::Result<()> {
        self.open_part(&format!(
            "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n\
             Content-Type: application/octet-stream\r\n",
            escape_quotes(name),
            escape_quotes(file_name)
        ));
        io::copy(reader, &mut self.buf)?;
        self.buf.write_all(b"\r\n")
    }

    fn open_part(&mut self, headers: &str) {
        self.buf.extend_from_slice(b"--");
        self.buf.extend_from_slice(self.boundary.as_bytes());
        self.buf.extend_from_slice(b"\r\n");
        self.buf.extend_from_slice(headers.as_bytes());
        self.buf.extend_from_slice(b"\r\n");
    }

    fn finish(mut self) -> Payload {
        self.buf.extend_from_slice(b"--");
        self.buf.extend_from_slice(self.boundary.as_bytes());
        self.buf.extend_from_slice(b"--\r\n");
        Payload {
            content_type: format!("multipart/form-data; boundary={}", self.boundary),
            body: Bytes::from(self.buf),
        }
    }
}

fn escape_quotes(s: &str) -> String {
    s.replace('\\', "\\\\").replace('"', "\\\"")
}
