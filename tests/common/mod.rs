#![allow(dead_code)]

use std::{cell::RefCell, collections::HashSet};

use ndvi_aoi::{AdminLevel, AdminUnit, BoundarySource, BoundingBox, Error, LookupRequest, Result};

pub fn unit(level: AdminLevel, code: &str, name: &str) -> AdminUnit {
    let n = code.len() as f64;
    AdminUnit::new(level, code, name, BoundingBox::new(73.0 + n, 74.0 + n, 18.0, 19.0 + n))
}

/// In-memory boundary service: two districts, two talukas each, two villages per taluka.
/// Records every request; requests listed in `failing` answer with a network error.
#[derive(Default)]
pub struct FakeSource {
    pub requests: RefCell<Vec<LookupRequest>>,
    pub failing: RefCell<HashSet<LookupRequest>>,
}

impl FakeSource {
    pub fn new() -> Self { Self::default() }

    pub fn fail(&self, request: LookupRequest) {
        self.failing.borrow_mut().insert(request);
    }

    pub fn requests(&self) -> Vec<LookupRequest> {
        self.requests.borrow().clone()
    }

    /// What the service would return, without recording the request.
    pub fn answer(request: &LookupRequest) -> Vec<AdminUnit> {
        match request {
            LookupRequest::Districts => vec![
                unit(AdminLevel::District, "01", "Pune"),
                unit(AdminLevel::District, "02", "Satara"),
            ],
            LookupRequest::Talukas { district } => match district.as_str() {
                "01" => vec![
                    unit(AdminLevel::Taluka, "0101", "Haveli"),
                    unit(AdminLevel::Taluka, "0102", "Mulshi"),
                ],
                "02" => vec![
                    unit(AdminLevel::Taluka, "0201", "Karad"),
                    unit(AdminLevel::Taluka, "0202", "Wai"),
                ],
                _ => Vec::new(),
            },
            LookupRequest::Villages { taluka } => vec![
                unit(AdminLevel::Village, &format!("{taluka}001"), &format!("Village {taluka}-1")),
                unit(AdminLevel::Village, &format!("{taluka}002"), &format!("Village {taluka}-2")),
            ],
        }
    }
}

impl BoundarySource for FakeSource {
    fn fetch(&self, request: &LookupRequest) -> Result<Vec<AdminUnit>> {
        self.requests.borrow_mut().push(request.clone());
        if self.failing.borrow().contains(request) {
            return Err(Error::Network { what: request.describe(), message: "connection refused".into() });
        }
        Ok(Self::answer(request))
    }
}

pub const SQUARE: &[u8] = br#"{"type":"Polygon","coordinates":[[[0,0],[1,0],[1,1],[0,0]]]}"#;
