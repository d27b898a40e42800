//! Vehicle-type catalog (`vtypes.add.xml`).
//!
//! Every trip's `type` attribute names one of these entries, so the catalog
//! must be passed to the route-assignment tool together with the trip files.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, Event};

use td_core::VehicleClass;

use crate::OutputResult;

/// File name of the catalog inside the output directory.
pub const VTYPES_FILE: &str = "vtypes.add.xml";

/// Physical and kinematic parameters of one vehicle class.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct VehicleType {
    pub class:      VehicleClass,
    /// SUMO `vClass` (access permissions on lanes).
    pub sumo_class: &'static str,
    pub length:     f64,
    pub width:      f64,
    /// m/s.
    pub max_speed:  f64,
    pub accel:      f64,
    pub decel:      f64,
    pub color:      &'static str,
}

impl VehicleType {
    pub fn for_class(class: VehicleClass) -> Self {
        let (sumo_class, length, width, max_speed, accel, decel, color) = match class {
            VehicleClass::Motorcycle => ("motorcycle", 2.0,  0.8, 16.67, 2.5, 4.5, "yellow"),
            VehicleClass::Car        => ("passenger",  4.5,  1.8, 19.44, 2.0, 4.0, "blue"),
            VehicleClass::Delivery   => ("delivery",   6.5,  2.2, 16.67, 1.5, 3.5, "green"),
            VehicleClass::Bus        => ("bus",        10.0, 2.5, 13.89, 1.0, 3.0, "red"),
            VehicleClass::Truck      => ("truck",      12.0, 2.5, 13.89, 0.8, 3.0, "grey"),
        };
        Self { class, sumo_class, length, width, max_speed, accel, decel, color }
    }

    /// One entry per class, in class order.
    pub fn catalog() -> Vec<VehicleType> {
        VehicleClass::ALL.iter().map(|&c| Self::for_class(c)).collect()
    }
}

/// Write the full catalog to `path`.
pub fn write_vtypes(path: &Path) -> OutputResult<()> {
    let file = BufWriter::new(File::create(path)?);
    let mut xml = Writer::new_with_indent(file, b' ', 4);
    xml.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
    xml.write_event(Event::Start(BytesStart::new("additional")))?;

    for vt in VehicleType::catalog() {
        let fields = [
            ("id", vt.class.as_str().to_string()),
            ("vClass", vt.sumo_class.to_string()),
            ("length", vt.length.to_string()),
            ("width", vt.width.to_string()),
            ("maxSpeed", vt.max_speed.to_string()),
            ("accel", vt.accel.to_string()),
            ("decel", vt.decel.to_string()),
            ("color", vt.color.to_string()),
        ];
        let mut elem = BytesStart::new("vType");
        for (key, value) in &fields {
            elem.push_attribute((*key, value.as_str()));
        }
        xml.write_event(Event::Empty(elem))?;
    }

    xml.write_event(Event::End(BytesEnd::new("additional")))?;
    let mut file = xml.into_inner();
    file.write_all(b"\n")?;
    file.flush()?;
    Ok(())
}
