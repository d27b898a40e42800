//! SUMO trip-file backend.
//!
//! Creates, in the configured output directory:
//! - `vtypes.add.xml`, written when the writer is opened
//! - `{prefix}.{class}.{dir}.trips.xml` per bucket (`{prefix}.{class}.trips.xml`
//!   for uniform buckets)
//! - `{prefix}.all.trips.xml` when a merged list is written
//!
//! Each file is opened, written, and flushed within one call, so a file on
//! disk is always complete.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use log::info;
use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, Event};

use td_core::{BucketId, TripRecord};

use crate::vtypes::{VTYPES_FILE, write_vtypes};
use crate::writer::TripWriter;
use crate::OutputResult;

const XSI_NS: &str = "http://www.w3.org/2001/XMLSchema-instance";
const ROUTES_XSD: &str = "http://sumo.dlr.de/xsd/routes_file.xsd";

/// `{prefix}.{class}[.{dir}].trips.xml`
pub fn bucket_file_name(prefix: &str, bucket: BucketId) -> String {
    format!("{prefix}.{}.trips.xml", bucket.file_stem())
}

/// `{prefix}.all.trips.xml`
pub fn merged_file_name(prefix: &str) -> String {
    format!("{prefix}.all.trips.xml")
}

/// One written trip file.
#[derive(Clone, Debug, PartialEq)]
pub struct TripFile {
    pub path:  PathBuf,
    pub trips: usize,
}

/// Paths of everything a [`SumoTripWriter`] produced.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TripArtifact {
    pub vtypes_file:  PathBuf,
    pub bucket_files: Vec<(BucketId, TripFile)>,
    pub merged_file:  Option<TripFile>,
}

impl TripArtifact {
    /// Trip files to hand to route assignment: the merged file if there is
    /// one, otherwise every bucket file.
    pub fn route_inputs(&self) -> Vec<&Path> {
        match &self.merged_file {
            Some(m) => vec![m.path.as_path()],
            None    => self.bucket_files.iter().map(|(_, f)| f.path.as_path()).collect(),
        }
    }

    /// Number of trips contained in [`route_inputs`](Self::route_inputs).
    pub fn trips_written(&self) -> usize {
        match &self.merged_file {
            Some(m) => m.trips,
            None    => self.bucket_files.iter().map(|(_, f)| f.trips).sum(),
        }
    }
}

/// Writes SUMO `routes` documents of `trip` elements.
pub struct SumoTripWriter {
    dir:      PathBuf,
    prefix:   String,
    artifact: TripArtifact,
}

impl SumoTripWriter {
    /// Create `dir` if needed and write the vehicle-type catalog into it.
    pub fn new(dir: &Path, prefix: &str) -> OutputResult<Self> {
        std::fs::create_dir_all(dir)?;
        let vtypes_file = dir.join(VTYPES_FILE);
        write_vtypes(&vtypes_file)?;
        Ok(Self {
            dir:      dir.to_path_buf(),
            prefix:   prefix.to_string(),
            artifact: TripArtifact { vtypes_file, ..TripArtifact::default() },
        })
    }

    pub fn artifact(&self) -> &TripArtifact {
        &self.artifact
    }

    pub fn into_artifact(self) -> TripArtifact {
        self.artifact
    }
}

impl TripWriter for SumoTripWriter {
    fn write_bucket(&mut self, bucket: BucketId, trips: &[TripRecord]) -> OutputResult<()> {
        let path = self.dir.join(bucket_file_name(&self.prefix, bucket));
        write_trips_file(&path, trips)?;
        info!("{bucket}: wrote {} trips to {}", trips.len(), path.display());
        self.artifact.bucket_files.push((bucket, TripFile { path, trips: trips.len() }));
        Ok(())
    }

    fn write_merged(&mut self, trips: &[TripRecord]) -> OutputResult<()> {
        let path = self.dir.join(merged_file_name(&self.prefix));
        write_trips_file(&path, trips)?;
        info!("wrote {} merged trips to {}", trips.len(), path.display());
        self.artifact.merged_file = Some(TripFile { path, trips: trips.len() });
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        // Every file is closed by the call that wrote it.
        Ok(())
    }
}

/// Write `trips` (already sorted by departure) as one `routes` document.
pub fn write_trips_file(path: &Path, trips: &[TripRecord]) -> OutputResult<()> {
    let file = BufWriter::new(File::create(path)?);
    let mut xml = Writer::new_with_indent(file, b' ', 4);
    xml.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;

    let mut root = BytesStart::new("routes");
    root.push_attribute(("xmlns:xsi", XSI_NS));
    root.push_attribute(("xsi:noNamespaceSchemaLocation", ROUTES_XSD));
    xml.write_event(Event::Start(root))?;

    for trip in trips {
        let id = trip.id.to_string();
        let depart = trip.depart_str();
        let mut elem = BytesStart::new("trip");
        elem.push_attribute(("id", id.as_str()));
        elem.push_attribute(("type", trip.class().as_str()));
        elem.push_attribute(("depart", depart.as_str()));
        elem.push_attribute(("from", trip.origin.as_str()));
        elem.push_attribute(("to", trip.destination.as_str()));
        elem.push_attribute(("departLane", "best"));
        elem.push_attribute(("departSpeed", "max"));
        xml.write_event(Event::Empty(elem))?;
    }

    xml.write_event(Event::End(BytesEnd::new("routes")))?;
    let mut file = xml.into_inner();
    file.write_all(b"\n")?;
    file.flush()?;
    Ok(())
}
