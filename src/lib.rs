//! # feature-jnlp
//!
//! Turns Eclipse feature archives from a Tycho update site into Java Web
//! Start descriptors.
//!
//! ## Architecture
//!
//! - **archive**: Reads `feature.xml` and bundle manifests out of jars
//! - **feature**: Feature manifest model and `feature.xml` walker
//! - **platform**: Groups plugins into per-platform `<resources>` blocks
//! - **version**: OSGi bundle versions and `MANIFEST.MF` attributes
//! - **scan**: Lists the jars of one bundle symbolic name
//! - **dedup**: Keeps the highest bundle version and renames jars
//! - **naming**: Update-site filename conventions
//! - **descriptor**: JNLP document model and builder
//! - **writer**: JNLP serialization
//! - **generate**: Recursive per-feature pipeline and run report

pub mod archive;
pub mod cli;
pub mod config;
pub mod dedup;
pub mod descriptor;
pub mod error;
pub mod feature;
pub mod generate;
pub mod naming;
pub mod platform;
pub mod scan;
pub mod version;
pub mod writer;
