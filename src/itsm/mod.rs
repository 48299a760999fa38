mod dataset;
mod records;
mod sample;
mod store;

pub use dataset::{Dataset, load_store, parse_dataset, write_dataset};
pub use records::{
    AiService, ChangeRequest, ChangeType, CiType, CmdbGroup, CmdbLink, CmdbNode, CmdbTopology,
    ConfigItem, Epic, Goal, Incident, Priority, Problem, Record, Risk, RiskRating, Service,
    ServiceHealth, Status,
};
pub use sample::sample_dataset;
pub use store::{Collection, ItsmStore, Lookup, StoreError};
