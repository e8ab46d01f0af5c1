mod conditions;
mod error;
mod graph;
mod resource;
mod result;
mod timeline;
#[cfg(test)]
mod tests;

pub use conditions::{
    matches_any, Condition, ConditionGroup, Operator, FIELD_ID, FIELD_NAME, FIELD_PARENT,
    FIELD_RESOURCE_TYPE, FIELD_RESOURCE_TYPE_NAME,
};
pub use error::EngineError;
pub use graph::link_hierarchy;
pub use resource::Resource;
pub use result::ResourceResult;
pub use timeline::{merge_availability, merge_timeline};
