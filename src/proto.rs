//! Generated wire types for the `ports.v1` gRPC API and their mapping to the
//! domain [`Port`].

use crate::core::Port;

#[allow(missing_docs, clippy::all, clippy::pedantic)]
pub mod pb {
    tonic::include_proto!("ports.v1");
}

impl From<pb::Port> for Port {
    fn from(p: pb::Port) -> Self {
        Self {
            id: p.id,
            name: p.name,
            city: p.city,
            country: p.country,
            alias: p.alias,
            regions: p.regions,
            coordinates: p.coordinates,
            province: p.province,
            timezone: p.timezone,
            unlocs: p.unlocs,
            code: p.code,
        }
    }
}

impl From<Port> for pb::Port {
    fn from(p: Port) -> Self {
        Self {
            id: p.id,
            name: p.name,
            city: p.city,
            country: p.country,
            alias: p.alias,
            regions: p.regions,
            coordinates: p.coordinates,
            province: p.province,
            timezone: p.timezone,
            unlocs: p.unlocs,
            code: p.code,
        }
    }
}
