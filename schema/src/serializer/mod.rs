//! Serializers for MLS provenance records.
//!
//! JSON-LD ([`jsonld`]) is the only supported format — the canonical shape
//! consumed by the metadata store (`<identifier>.jsonld` files).

pub mod jsonld;
