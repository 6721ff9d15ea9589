//! Client and table normalizer for the data submission portal's GraphQL API.
//!
//! A [`client::HubClient`] is bound to one deployment [`tier::Tier`] and
//! runs static [`queries`]; [`normalize`] and [`reports`] turn the nested
//! responses into flat tables. [`diff`], [`upload`] and [`reset`] are the
//! multi-request workflows built on top; [`create`] opens new submissions.

pub mod client;
pub mod config;
pub mod create;
pub mod diff;
pub mod error;
pub mod normalize;
pub mod queries;
pub mod reports;
pub mod reset;
pub mod tier;
pub mod types;
pub mod upload;
