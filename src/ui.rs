// Command flows: wire the CLI arguments to the transfer client and render
// progress with `indicatif` while bytes move.

use std::io::{self, Read, Write};

use anyhow::{bail, Result};
use indicatif::{ProgressBar, ProgressStyle};
use reqwest::Url;

use crate::api::{Filebin, ProgressFn, Upload};

/// Upload the named sources as one multipart POST and print the server's
/// response body to stdout. Arguments are local paths, http(s) urls
/// (fetched and re-uploaded), or `-` for stdin; with no arguments, stdin
/// is uploaded.
pub fn upload(fb: &Filebin, args: &[String]) -> Result<()> {
    let mut up = fb.new_upload()?;

    if args.is_empty() {
        up.add_stdin(io::stdin().lock())?;
    } else {
        for arg in args {
            if arg == "-" {
                up.add_stdin(io::stdin().lock())?;
                continue;
            }

            if let Ok(url) = Url::parse(arg) {
                if matches!(url.scheme(), "http" | "https") {
                    add_url(fb, &mut up, &url)?;
                    continue;
                }
            }

            up.add_file(arg)?;
        }
    }

    // The bar length is patched from the first report; the session knows
    // the total only once the body is closed inside `send`.
    let bar = bytes_bar(Some(0), "uploading");
    let reporter: ProgressFn = {
        let bar = bar.clone();
        Box::new(move |read, total| {
            bar.set_length(total);
            bar.set_position(read);
        })
    };

    let body = up.send(Some(reporter))?;
    bar.finish();

    print!("{}", body);
    io::stdout().flush()?;
    Ok(())
}

/// Delete exactly one file by id or url.
pub fn delete(fb: &Filebin, args: &[String]) -> Result<()> {
    if args.is_empty() {
        bail!("nothing selected");
    }
    if args.len() != 1 {
        bail!("only one file can be deleted");
    }
    fb.delete(&args[0])?;
    Ok(())
}

/// Fetch a remote url and append its body to the upload, with a download
/// bar sized from Content-Length when the server declares one.
fn add_url(fb: &Filebin, up: &mut Upload<'_>, url: &Url) -> Result<()> {
    let filename = url_filename(url);
    let resp = fb.fetch(url.clone())?;

    let bar = bytes_bar(resp.content_length(), "downloading");
    up.add_reader(
        &filename,
        BarReader {
            inner: resp,
            bar: bar.clone(),
        },
    )?;
    bar.finish();
    Ok(())
}

/// Part name for a remote source: the url's last path segment, or `-` when
/// the path ends in a separator.
fn url_filename(url: &Url) -> String {
    let name = url
        .path_segments()
        .and_then(|mut segments| segments.next_back())
        .unwrap_or("");
    if name.is_empty() {
        "-".to_string()
    } else {
        name.to_string()
    }
}

/// Byte-styled progress bar; a counting spinner when the length is unknown.
fn bytes_bar(length: Option<u64>, msg: &'static str) -> ProgressBar {
    let bar = match length {
        Some(len) => ProgressBar::new(len).with_style(
            ProgressStyle::with_template(
                "{msg} {bytes}/{total_bytes} [{wide_bar}] {bytes_per_sec}",
            )
            .unwrap()
            .progress_chars("=> "),
        ),
        None => ProgressBar::new_spinner()
            .with_style(ProgressStyle::with_template("{msg} {bytes} {spinner}").unwrap()),
    };
    bar.set_message(msg);
    bar
}

/// Counts bytes into a progress bar as the inner reader is drained.
struct BarReader<R> {
    inner: R,
    bar: ProgressBar,
}

impl<R: Read> Read for BarReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = self.inner.read(buf)?;
        self.bar.inc(n as u64);
        Ok(n)
    }
}
