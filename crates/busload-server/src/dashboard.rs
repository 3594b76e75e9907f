//! HTML rendering for the dashboard.
//!
//! Markup is produced with `quick-xml`'s writer, so every interpolated value
//! is escaped on the way out.

use std::io::Cursor;

use busload_core::Reading;
use chrono::{Local, TimeZone as _};
use quick_xml::{
  Writer,
  events::{BytesEnd, BytesStart, BytesText, Event},
};

use crate::error::Error;

/// Rows shown on the dashboard.
pub const DASHBOARD_ROWS: usize = 100;

pub const DEFAULT_TITLE: &str = "Bus Occupancy Dashboard";

type Html = Writer<Cursor<Vec<u8>>>;

/// Render `readings` (already newest first) as a complete HTML document.
pub fn render(title: &str, readings: &[Reading]) -> Result<String, Error> {
  let mut w = Writer::new(Cursor::new(Vec::new()));

  write(&mut w, Event::DocType(BytesText::from_escaped("html")))?;
  write_start(&mut w, "html")?;

  write_start(&mut w, "head")?;
  write(
    &mut w,
    Event::Empty(BytesStart::new("meta").with_attributes([("charset", "utf-8")])),
  )?;
  write_text_elem(&mut w, "title", title)?;
  write_end(&mut w, "head")?;

  write_start(&mut w, "body")?;
  write_text_elem(&mut w, "h2", title)?;
  write_text_elem(&mut w, "p", "Latest readings (time, count, capacity)")?;

  write(
    &mut w,
    Event::Start(
      BytesStart::new("table").with_attributes([("border", "1"), ("cellpadding", "6")]),
    ),
  )?;
  write_start(&mut w, "tr")?;
  for header in ["Time", "Count", "Capacity"] {
    write_text_elem(&mut w, "th", header)?;
  }
  write_end(&mut w, "tr")?;

  for r in readings {
    write_start(&mut w, "tr")?;
    write_text_elem(&mut w, "td", &format_local(r.timestamp))?;
    write_text_elem(&mut w, "td", &r.count.to_string())?;
    write_text_elem(&mut w, "td", &r.capacity.to_string())?;
    write_end(&mut w, "tr")?;
  }
  write_end(&mut w, "table")?;

  write_text_elem(
    &mut w,
    "p",
    "To simulate external posts, run busload-sim against this server.",
  )?;
  write_end(&mut w, "body")?;
  write_end(&mut w, "html")?;

  String::from_utf8(w.into_inner().into_inner()).map_err(|e| Error::Render(e.to_string()))
}

/// `YYYY-MM-DD HH:MM:SS` in server local time. Falls back to raw seconds for
/// timestamps chrono cannot represent.
pub fn format_local(ts: i64) -> String {
  match Local.timestamp_opt(ts, 0).earliest() {
    Some(dt) => dt.format("%Y-%m-%d %H:%M:%S").to_string(),
    None => ts.to_string(),
  }
}

fn write(w: &mut Html, event: Event<'_>) -> Result<(), Error> {
  w.write_event(event).map_err(|e| Error::Render(e.to_string()))
}

fn write_start(w: &mut Html, tag: &str) -> Result<(), Error> {
  write(w, Event::Start(BytesStart::new(tag)))
}

fn write_end(w: &mut Html, tag: &str) -> Result<(), Error> {
  write(w, Event::End(BytesEnd::new(tag)))
}

fn write_text_elem(w: &mut Html, tag: &str, text: &str) -> Result<(), Error> {
  write_start(w, tag)?;
  write(w, Event::Text(BytesText::new(text)))?;
  write_end(w, tag)
}
