//! # services
//!
//! Application services orchestrating the domain ports: menu graph,
//! catalog, community, the ACL resolver, and the TTL-cached gate
//! probes.

pub mod acl;
pub mod cache;
pub mod catalog;
pub mod community;
pub mod menu;
pub mod setup;

pub use acl::{AclService, AclSets, CachedAclResolver};
pub use cache::{Clock, ManualClock, SystemClock, TtlCache};
pub use catalog::{CatalogService, CategoryWithCount};
pub use community::{BoardInput, CommunityService};
pub use menu::{MenuItemInput, MenuItemView, MenuService, MenuView};
pub use setup::{CachedSetupProbe, SetupService};
