// Transfer client module: a small blocking HTTP client for filebin-style
// sharing services. It accumulates named byte sources into one
// multipart/form-data body, POSTs it with progress reporting, and can
// delete previously uploaded files by id or url.

use std::fs::File;
use std::io::{self, Cursor, Read, Write};
use std::path::Path;
use std::time::Duration;

use reqwest::blocking::{Body, Client, Response};
use reqwest::header::CONTENT_TYPE;
use reqwest::Url;
use uuid::Uuid;

use crate::config::Config;
use crate::error::FbinError;

/// Callback invoked from the request body's read path with the number of
/// bytes sent so far and the total body length.
pub type ProgressFn = Box<dyn FnMut(u64, u64) + Send>;

/// Client for a filebin-style service: holds the endpoint url, the basic
/// auth credentials, and one shared blocking HTTP client.
pub struct Filebin {
    client: Client,
    url: String,
    username: String,
    password: String,
}

impl Filebin {
    /// Build a client from a loaded configuration. The HTTP client has no
    /// overall request timeout (uploads may be large); only connecting is
    /// bounded.
    pub fn new(config: Config) -> Result<Self, FbinError> {
        let client = Client::builder()
            .timeout(None)
            .connect_timeout(Duration::from_secs(30))
            .build()?;
        Ok(Filebin {
            client,
            url: config.url,
            username: config.username,
            password: config.password,
        })
    }

    fn check(&self) -> Result<(), FbinError> {
        if self.url.is_empty() {
            return Err(FbinError::NoUrl);
        }
        if self.username.is_empty() {
            return Err(FbinError::NoUsername);
        }
        if self.password.is_empty() {
            return Err(FbinError::NoPassword);
        }
        Ok(())
    }

    /// Start an empty upload session. Fails with the specific missing-field
    /// error if the configuration is incomplete, before any filesystem or
    /// network activity.
    pub fn new_upload(&self) -> Result<Upload<'_>, FbinError> {
        self.check()?;
        Ok(Upload {
            fb: self,
            buf: Vec::new(),
            boundary: Uuid::new_v4().simple().to_string(),
            done: false,
            stdin_used: false,
        })
    }

    /// Plain GET on the shared client, used to mirror a remote file into an
    /// upload. The response body is consumed by the caller.
    pub fn fetch(&self, url: Url) -> Result<Response, FbinError> {
        Ok(self.client.get(url).send()?)
    }

    /// Delete a previously uploaded file. `target` is either a bare id,
    /// appended to the endpoint, or a full url on the endpoint's host.
    pub fn delete(&self, target: &str) -> Result<(), FbinError> {
        self.check()?;
        if target.is_empty() {
            return Err(FbinError::NoTarget);
        }

        let url = self.delete_url(target)?;

        let resp = self
            .client
            .delete(&url)
            .basic_auth(&self.username, Some(&self.password))
            .send()?;

        match resp.status().as_u16() {
            200 => Ok(()),
            401 => Err(FbinError::Unauthorized),
            404 => Err(FbinError::NotFound),
            500 => Err(FbinError::InternalServerError),
            _ => Err(FbinError::UnexpectedStatus(resp.status().to_string())),
        }
    }

    // A bare id (no scheme, no host, no separator) is appended to the
    // endpoint with exactly one slash; an absolute url must match the
    // endpoint's scheme and host. Anything else is rejected before any
    // request is made.
    fn delete_url(&self, target: &str) -> Result<String, FbinError> {
        match Url::parse(target) {
            Ok(url) => {
                let base = Url::parse(&self.url)
                    .map_err(|_| FbinError::InvalidUrl(self.url.clone()))?;
                if url.scheme() != base.scheme()
                    || url.host_str() != base.host_str()
                    || url.port_or_known_default() != base.port_or_known_default()
                {
                    return Err(FbinError::InvalidUrl(target.to_string()));
                }
                Ok(url.into())
            }
            Err(_) if !target.contains('/') => {
                let mut url = self.url.clone();
                if !url.ends_with('/') {
                    url.push('/');
                }
                url.push_str(target);
                Ok(url)
            }
            Err(_) => Err(FbinError::InvalidUrl(target.to_string())),
        }
    }
}

/// One upload attempt: named byte sources are encoded into a single
/// multipart/form-data body as they are added, then the body is sent
/// exactly once with [`Upload::send`].
pub struct Upload<'a> {
    fb: &'a Filebin,
    buf: Vec<u8>,
    boundary: String,
    done: bool,
    stdin_used: bool,
}

impl Upload<'_> {
    /// Append a local file as a part named after the path's final component.
    pub fn add_file(&mut self, path: &str) -> Result<(), FbinError> {
        if self.done {
            return Err(FbinError::UploadDone);
        }
        if path.is_empty() {
            return Err(FbinError::NoFilename);
        }

        let filename = Path::new(path)
            .file_name()
            .and_then(|name| name.to_str())
            .map(str::to_owned)
            .ok_or(FbinError::NoFilename)?;

        let mut file = File::open(path)?;
        self.append_part(&filename, &mut file)
    }

    /// Append an arbitrary byte stream as a part with the given name. The
    /// stream is drained into the body immediately.
    pub fn add_reader(&mut self, filename: &str, reader: impl Read) -> Result<(), FbinError> {
        if self.done {
            return Err(FbinError::UploadDone);
        }
        if filename.is_empty() {
            return Err(FbinError::NoFilename);
        }
        self.append_part(filename, reader)
    }

    /// Append standard input as the part named `-`. At most one stdin
    /// source is accepted per session.
    pub fn add_stdin(&mut self, stdin: impl Read) -> Result<(), FbinError> {
        if self.done {
            return Err(FbinError::UploadDone);
        }
        if self.stdin_used {
            return Err(FbinError::StdinRepeated);
        }
        self.stdin_used = true;
        self.append_part("-", stdin)
    }

    fn append_part(&mut self, filename: &str, mut reader: impl Read) -> Result<(), FbinError> {
        // quotes and backslashes must not break the Content-Disposition line
        let escaped = filename.replace('\\', "\\\\").replace('"', "\\\"");
        write!(
            self.buf,
            "--{}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{}\"\r\nContent-Type: application/octet-stream\r\n\r\n",
            self.boundary, escaped
        )?;
        io::copy(&mut reader, &mut self.buf)?;
        self.buf.extend_from_slice(b"\r\n");
        Ok(())
    }

    /// Close the body and POST it to the endpoint. Exactly-once: after this
    /// call any further add or send fails with [`FbinError::UploadDone`].
    /// On 200 the response body is returned, the server's representation of
    /// the uploaded resource.
    pub fn send(&mut self, progress: Option<ProgressFn>) -> Result<String, FbinError> {
        if self.done {
            return Err(FbinError::UploadDone);
        }

        write!(self.buf, "--{}--\r\n", self.boundary)?;
        self.done = true;

        let body = std::mem::take(&mut self.buf);
        let length = body.len() as u64;
        let reader = ProgressReader {
            inner: Cursor::new(body),
            read: 0,
            length,
            progress,
        };

        let resp = self
            .fb
            .client
            .post(&self.fb.url)
            .header(
                CONTENT_TYPE,
                format!("multipart/form-data; boundary={}", self.boundary),
            )
            .basic_auth(&self.fb.username, Some(&self.fb.password))
            .body(Body::sized(reader, length))
            .send()?;

        match resp.status().as_u16() {
            200 => {}
            400 => return Err(FbinError::BadRequest),
            401 => return Err(FbinError::Unauthorized),
            500 => return Err(FbinError::InternalServerError),
            _ => return Err(FbinError::UnexpectedStatus(resp.status().to_string())),
        }

        Ok(resp.text()?)
    }
}

/// Request body wrapper reporting cumulative bytes read to the progress
/// callback, when one is set.
struct ProgressReader {
    inner: Cursor<Vec<u8>>,
    read: u64,
    length: u64,
    progress: Option<ProgressFn>,
}

impl Read for ProgressReader {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = self.inner.read(buf)?;
        if let Some(report) = self.progress.as_mut() {
            self.read += n as u64;
            report(self.read, self.length);
        }
        Ok(n)
    }
}
