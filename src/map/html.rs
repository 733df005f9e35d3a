//! Leaflet HTML page writing.

use std::{fs::File, io::Write, path::{Path, PathBuf}};

use anyhow::{bail, Context, Result};
use tempfile::NamedTempFile;

use crate::config::PageConfig;

use super::view::MapView;

const LEAFLET_CSS: &str = "https://unpkg.com/leaflet@1.9.4/dist/leaflet.css";
const LEAFLET_JS: &str = "https://unpkg.com/leaflet@1.9.4/dist/leaflet.js";
const LEAFLET_DRAW_CSS: &str = "https://cdnjs.cloudflare.com/ajax/libs/leaflet.draw/1.0.4/leaflet.draw.css";
const LEAFLET_DRAW_JS: &str = "https://cdnjs.cloudflare.com/ajax/libs/leaflet.draw/1.0.4/leaflet.draw.js";

/// In-memory HTML writer.
pub(crate) struct HtmlStringWriter {
    buffer: Vec<u8>
}

/// Implement std::io::Write so `write!` / `writeln!` work.
impl Write for HtmlStringWriter {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.buffer.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> { Ok(()) }
}

impl HtmlStringWriter {
    pub(crate) fn new() -> Self {
        Self { buffer: Vec::new() }
    }

    pub(crate) fn into_string(self) -> Result<String> {
        String::from_utf8(self.buffer).context("[map::html] output is not valid UTF-8")
    }
}

/// Write-then-rename wrapper so a half-written page never replaces a good one.
struct PendingWrite {
    target: PathBuf,
    tmp: NamedTempFile,
}

impl PendingWrite {
    fn open(target: &Path, force: bool) -> Result<Self> {
        let parent = match target.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir,
            _ => Path::new("."),
        };
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create dir {}", parent.display()))?;
        if !force && target.exists() {
            bail!("Refusing to overwrite existing file: {} (use --force)", target.display());
        }
        let tmp = NamedTempFile::new_in(parent).context("create temp file")?;
        Ok(Self { target: target.to_path_buf(), tmp })
    }

    fn finalize(self) -> Result<()> {
        self.tmp.as_file().sync_all().ok(); // best-effort fsync file
        let dir = self.target.parent().map(Path::to_path_buf);
        self.tmp.persist(&self.target)
            .with_context(|| format!("rename to {}", self.target.display()))?;
        if let Some(dir) = dir.filter(|d| !d.as_os_str().is_empty()) {
            let _ = File::open(dir).and_then(|f| f.sync_all());
        }
        Ok(())
    }
}

/// Render into memory, then atomically write to `path`.
pub(crate) fn write_html_file(
    path: &Path,
    force: bool,
    render: impl FnOnce(&mut HtmlStringWriter) -> Result<()>,
) -> Result<()> {
    let mut writer = HtmlStringWriter::new();
    render(&mut writer)?;

    let mut sink = PendingWrite::open(path, force)?;
    sink.tmp.write_all(&writer.buffer)
        .with_context(|| format!("write {}", path.display()))?;
    sink.finalize()
}

/// Write a complete page: heading, description, map container and Leaflet script.
pub(crate) fn write_map_page<W: Write>(writer: &mut W, view: &MapView, page: &PageConfig) -> Result<()> {
    write_html_head(writer, &page.title)?;
    write_html_body(writer, view, page)?;
    write_map_script(writer, view)?;
    writeln!(writer, "</body>\n</html>")?;
    Ok(())
}

fn write_html_head<W: Write>(writer: &mut W, title: &str) -> Result<()> {
    writeln!(writer, r##"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{title}</title>
<link rel="stylesheet" href="{LEAFLET_CSS}">
<link rel="stylesheet" href="{LEAFLET_DRAW_CSS}">
<script src="{LEAFLET_JS}"></script>
<script src="{LEAFLET_DRAW_JS}"></script>
<style>
    body {{ font-family: sans-serif; margin: 1rem; }}
    #export {{ position: absolute; top: 10px; right: 10px; z-index: 1000; background: #fff;
               padding: 4px 8px; border: 1px solid #999; border-radius: 4px; cursor: pointer; }}
    .map-wrap {{ position: relative; }}
</style>
</head>"##,
        title = escape_html(title),
    )?;
    Ok(())
}

fn write_html_body<W: Write>(writer: &mut W, view: &MapView, page: &PageConfig) -> Result<()> {
    let (width, height) = view.size();
    let width = width.map_or_else(|| "100%".to_string(), |w| format!("{w}px"));
    writeln!(writer, r##"<body>
<h1>{title}</h1>
<p>{description}</p>
<aside>{about}</aside>
<div class="map-wrap">
<div id="map" style="width: {width}; height: {height}px;"></div>"##,
        title = escape_html(&page.title),
        description = escape_html(&page.description),
        about = escape_html(&page.about),
    )?;
    if view.draw_control().export {
        writeln!(writer, r##"<a id="export" download="data.geojson">Export</a>"##)?;
    }
    writeln!(writer, "</div>")?;
    Ok(())
}

fn write_map_script<W: Write>(writer: &mut W, view: &MapView) -> Result<()> {
    let layers = script_json(&view.layers())?;
    let draw = script_json(view.draw_control())?;
    let bounds = script_json(&view.view_bounds().map(|b| b.to_leaflet_bounds()))?;
    let [lat, lon] = view.center();

    writeln!(writer, r##"<script>
const map = L.map('map', {{ zoomControl: false }}).setView([{lat}, {lon}], {zoom});
const layers = {layers};
const draw = {draw};
const overlays = {{}};
for (const layer of layers) {{
    let l;
    if (layer.kind === 'tiles') {{
        l = L.tileLayer(layer.url, {{ attribution: layer.attribution, maxZoom: 19 }});
    }} else if (layer.kind === 'wms') {{
        l = L.tileLayer.wms(layer.url, {{ layers: layer.layers, format: layer.format, transparent: layer.transparent }});
        overlays[layer.name] = l;
    }} else if (layer.kind === 'geojson') {{
        l = L.geoJSON(layer.geometry);
        overlays[layer.name] = l;
    }}
    if (l) {{ l.addTo(map); }}
}}
L.control.layers({{}}, overlays).addTo(map);
const drawn = new L.FeatureGroup().addTo(map);
map.addControl(new L.Control.Draw({{
    draw: draw.draw,
    edit: {{ featureGroup: drawn, edit: draw.edit.edit, remove: draw.edit.remove }},
}}));
map.on(L.Draw.Event.CREATED, (e) => drawn.addLayer(e.layer));
const exportLink = document.getElementById('export');
if (exportLink) {{
    exportLink.onclick = () => {{
        const data = JSON.stringify(drawn.toGeoJSON());
        exportLink.href = 'data:application/json;charset=utf-8,' + encodeURIComponent(data);
    }};
}}
const bounds = {bounds};
if (bounds) {{ map.fitBounds(bounds); }}
</script>"##,
        zoom = view.zoom(),
    )?;
    Ok(())
}

/// JSON for inline `<script>` use; `</` is escaped so data cannot close the tag.
fn script_json<T: serde::Serialize + ?Sized>(value: &T) -> Result<String> {
    let json = serde_json::to_string(value).context("[map::html] serialize script data")?;
    Ok(json.replace("</", "<\\/"))
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{aoi::AoiGeometry, config::MapConfig, map::layer::{WMS_LAYERS, WMS_URL}};

    #[test]
    fn escapes_markup() {
        assert_eq!(escape_html(r#"<b>"A" & 'B'</b>"#), "&lt;b&gt;&quot;A&quot; &amp; &#39;B&#39;&lt;/b&gt;");
    }

    #[test]
    fn script_json_cannot_close_script_tag() {
        let json = script_json("</script><script>alert(1)").unwrap();
        assert!(!json.contains("</script>"));
    }

    #[test]
    fn page_contains_map_wms_and_aoi() {
        let mut view = MapView::new(&MapConfig::default());
        let aoi = AoiGeometry::parse(br#"{"type":"Polygon","coordinates":[[[73,18],[74,18],[74,19],[73,18]]]}"#).unwrap();
        view.render(Some(&aoi));

        let page = PageConfig { title: "NDVI <AOI>".into(), ..PageConfig::default() };
        let html = view.to_html(&page).unwrap();

        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<title>NDVI &lt;AOI&gt;</title>"));
        assert!(html.contains("setView([18.7515, 76.7139], 7)"));
        assert!(html.contains(WMS_URL));
        assert!(html.contains(WMS_LAYERS));
        assert!(html.contains(r#""kind":"geojson""#));
        assert!(html.contains("height: 700px"));
        assert!(html.contains("width: 100%"));
        assert!(html.contains(r#"const bounds = [[18.0,73.0],[19.0,74.0]];"#));
        assert!(html.trim_end().ends_with("</html>"));
    }

    #[test]
    fn page_without_aoi_has_no_geojson_layer() {
        let view = MapView::new(&MapConfig { width: Some(640), ..MapConfig::default() });
        let html = view.to_html(&PageConfig::default()).unwrap();
        assert!(!html.contains(r#""kind":"geojson""#));
        assert!(html.contains("width: 640px"));
        assert!(html.contains("const bounds = null;"));
    }

    #[test]
    fn write_html_refuses_overwrite_without_force() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("map.html");
        let view = MapView::new(&MapConfig::default());

        view.write_html(&PageConfig::default(), &path, false).unwrap();
        assert!(std::fs::read_to_string(&path).unwrap().contains("L.map('map'"));

        let err = view.write_html(&PageConfig::default(), &path, false).unwrap_err();
        assert!(err.to_string().contains("Refusing to overwrite"));
        view.write_html(&PageConfig::default(), &path, true).unwrap();
    }
}
