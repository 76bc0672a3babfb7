use std::borrow::Cow;

use quick_xml::{
    Writer,
    escape::escape,
    events::{BytesDecl, BytesStart, Event},
};

use crate::{
    foundation::error::{StoryreelError, StoryreelResult},
    timeline::node::{
        Consumer, Filter, MltDocument, Playlist, PlaylistItem, Producer, ProducerSource,
        TextFilter, Tractor, VolumeFilter,
    },
};

type XmlWriter = Writer<Vec<u8>>;

/// Render `doc` as an MLT XML string.
///
/// Elements are written in document order: profile, background producer, segment producers,
/// playlists, tractor and the optional consumer. Attribute values are XML-escaped, with line
/// breaks and tabs kept as character references.
pub fn to_mlt_xml(doc: &MltDocument) -> StoryreelResult<String> {
    let mut w = Writer::new_with_indent(Vec::new(), b' ', 2);

    emit(&mut w, Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))?;
    let root = element("mlt", &[("title", doc.title.as_str())]);
    write_element(&mut w, root, true, |w| {
        write_profile(w, doc)?;
        write_producer(w, &doc.background)?;
        for producer in &doc.producers {
            write_producer(w, producer)?;
        }
        for playlist in &doc.playlists {
            write_playlist(w, playlist)?;
        }
        write_tractor(w, &doc.tractor)?;
        if let Some(consumer) = &doc.consumer {
            write_consumer(w, consumer)?;
        }
        Ok(())
    })?;

    String::from_utf8(w.into_inner())
        .map_err(|e| StoryreelError::serde(format!("mlt xml is not utf-8: {e}")))
}

fn emit(w: &mut XmlWriter, event: Event<'_>) -> StoryreelResult<()> {
    w.write_event(event)
        .map_err(|e| StoryreelError::serde(format!("write mlt xml: {e}")))
}

fn element<'a>(name: &'a str, attrs: &[(&str, &str)]) -> BytesStart<'a> {
    let mut el = BytesStart::new(name);
    for &(key, value) in attrs {
        let value = escape_attr(value);
        el.push_attribute((key.as_bytes(), value.as_bytes()));
    }
    el
}

/// Markup escaping plus character references for whitespace that attribute-value
/// normalization would otherwise fold into spaces (multi-line titles).
fn escape_attr(value: &str) -> Cow<'_, str> {
    let escaped = escape(value);
    if !escaped.contains(['\n', '\r', '\t']) {
        return escaped;
    }
    let mut out = String::with_capacity(escaped.len() + 8);
    for c in escaped.chars() {
        match c {
            '\n' => out.push_str("&#10;"),
            '\r' => out.push_str("&#13;"),
            '\t' => out.push_str("&#9;"),
            c => out.push(c),
        }
    }
    Cow::Owned(out)
}

/// Self-closing element without children, start/children/end otherwise.
fn write_element(
    w: &mut XmlWriter,
    el: BytesStart<'_>,
    has_children: bool,
    children: impl FnOnce(&mut XmlWriter) -> StoryreelResult<()>,
) -> StoryreelResult<()> {
    if !has_children {
        return emit(w, Event::Empty(el));
    }
    let end = el.to_end().into_owned();
    emit(w, Event::Start(el))?;
    children(w)?;
    emit(w, Event::End(end))
}

fn write_empty(w: &mut XmlWriter, name: &str, attrs: &[(&str, &str)]) -> StoryreelResult<()> {
    emit(w, Event::Empty(element(name, attrs)))
}

fn write_profile(w: &mut XmlWriter, doc: &MltDocument) -> StoryreelResult<()> {
    let p = &doc.profile;
    let width = p.canvas.width.to_string();
    let height = p.canvas.height.to_string();
    let sar_num = p.sample_aspect.0.to_string();
    let sar_den = p.sample_aspect.1.to_string();
    let fps_num = p.fps.num.to_string();
    let fps_den = p.fps.den.to_string();
    write_empty(
        w,
        "profile",
        &[
            ("width", width.as_str()),
            ("height", height.as_str()),
            ("progressive", bool_str(p.progressive)),
            ("sample_aspect_num", sar_num.as_str()),
            ("sample_aspect_den", sar_den.as_str()),
            ("frame_rate_num", fps_num.as_str()),
            ("frame_rate_den", fps_den.as_str()),
            ("colorspace", p.colorspace),
        ],
    )
}

fn write_producer(w: &mut XmlWriter, p: &Producer) -> StoryreelResult<()> {
    let in_frame = p.in_frame.to_string();
    let out_frame = p.out_frame.to_string();
    let length = p.length.to_string();

    let mut attrs: Vec<(&str, &str)> = vec![
        ("id", p.id.as_str()),
        ("in", in_frame.as_str()),
        ("out", out_frame.as_str()),
        ("length", length.as_str()),
        ("resource", p.source.resource()),
        ("mlt_service", p.source.service()),
        ("eof", "pause"),
    ];
    match &p.source {
        ProducerSource::Color { .. } => {
            attrs.push(("mlt_image_format", "rgba"));
            attrs.push(("aspect_ratio", "1"));
        }
        ProducerSource::Image { .. } => {
            attrs.push(("ttl", "1"));
            attrs.push(("aspect_ratio", "1"));
        }
        ProducerSource::Audio { .. } => {
            attrs.push(("audio_index", "0"));
            attrs.push(("video_index", "-1"));
        }
    }

    let el = element("producer", &attrs);
    write_element(w, el, !p.filters.is_empty(), |w| {
        for filter in &p.filters {
            match filter {
                Filter::DynamicText(f) => write_text_filter(w, f)?,
                Filter::Volume(f) => write_volume_filter(w, f)?,
            }
        }
        Ok(())
    })
}

fn write_text_filter(w: &mut XmlWriter, f: &TextFilter) -> StoryreelResult<()> {
    let size = f.size.to_string();
    write_empty(
        w,
        "filter",
        &[
            ("id", f.id.as_str()),
            ("argument", f.text.as_str()),
            ("geometry", f.geometry.as_str()),
            ("size", size.as_str()),
            ("weight", "500"),
            ("style", "normal"),
            ("fgcolour", f.fg_colour.as_str()),
            ("bgcolour", f.bg_colour.as_str()),
            ("olcolour", f.bg_colour.as_str()),
            ("halign", f.halign),
            ("valign", "middle"),
            ("mlt_service", "dynamictext"),
            ("family", f.family),
            ("shotcut:filter", "dynamicText"),
            ("shotcut:usePointSize", "1"),
            ("shotcut:pointSize", size.as_str()),
        ],
    )
}

fn write_volume_filter(w: &mut XmlWriter, f: &VolumeFilter) -> StoryreelResult<()> {
    let out_frame = f.out_frame.to_string();
    let level = f.level_db.to_string();
    write_empty(
        w,
        "filter",
        &[
            ("id", f.id.as_str()),
            ("in", "0"),
            ("out", out_frame.as_str()),
            ("window", "75"),
            ("max_gain", "20dB"),
            ("level", level.as_str()),
            ("mlt_service", "volume"),
        ],
    )
}

fn write_playlist(w: &mut XmlWriter, p: &Playlist) -> StoryreelResult<()> {
    let el = element("playlist", &[("id", p.id)]);
    write_element(w, el, !p.items.is_empty(), |w| {
        for item in &p.items {
            match item {
                PlaylistItem::Entry {
                    producer,
                    in_frame,
                    out_frame,
                } => {
                    let in_frame = in_frame.to_string();
                    let out_frame = out_frame.to_string();
                    write_empty(
                        w,
                        "entry",
                        &[
                            ("producer", producer.as_str()),
                            ("in", in_frame.as_str()),
                            ("out", out_frame.as_str()),
                        ],
                    )?;
                }
                PlaylistItem::Blank { length } => {
                    let length = length.to_string();
                    write_empty(w, "blank", &[("length", length.as_str())])?;
                }
            }
        }
        Ok(())
    })
}

fn write_tractor(w: &mut XmlWriter, t: &Tractor) -> StoryreelResult<()> {
    let el = element(
        "tractor",
        &[
            ("id", t.id.as_str()),
            ("shotcut", "1"),
            ("shotcut:projectAudioChannels", "2"),
            ("shotcut:projectFolder", "1"),
        ],
    );
    write_element(w, el, true, |w| {
        for track in &t.tracks {
            match track.hide {
                Some(hide) => write_empty(
                    w,
                    "track",
                    &[("producer", track.producer), ("hide", hide.as_str())],
                )?,
                None => write_empty(w, "track", &[("producer", track.producer)])?,
            }
        }
        for tr in &t.transitions {
            let a = tr.a_track.to_string();
            let b = tr.b_track.to_string();
            write_empty(
                w,
                "transition",
                &[
                    ("id", tr.id.as_str()),
                    ("a_track", a.as_str()),
                    ("b_track", b.as_str()),
                    ("mlt_service", "mix"),
                    ("always_active", "true"),
                    ("sum", "1"),
                ],
            )?;
        }
        Ok(())
    })
}

fn write_consumer(w: &mut XmlWriter, c: &Consumer) -> StoryreelResult<()> {
    let rate = c.rate.to_string();
    write_empty(
        w,
        "consumer",
        &[
            ("id", "consumer0"),
            ("target", c.target.as_str()),
            ("mlt_service", "avformat"),
            ("r", rate.as_str()),
        ],
    )
}

fn bool_str(v: bool) -> &'static str {
    if v { "true" } else { "false" }
}

#[cfg(test)]
#[path = "../../tests/unit/encode/mlt_xml.rs"]
mod tests;
