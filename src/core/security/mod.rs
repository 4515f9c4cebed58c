// Security module for collection access control
//
// This module decides which collection names the dynamic router may bind,
// so that arbitrary path segments never reach the store unchecked.

pub mod collection_policy;

pub use collection_policy::{CollectionAccessError, CollectionPolicy, validate_collection};
