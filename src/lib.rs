// Leasekit - Data-shaping utilities for billing/leasing applications
// Exposes the cycle engine plus the supporting table/form transforms

pub mod cycles;      // Cycle engine: group/ungroup monetary line items
pub mod reconcile;   // Id-based diff and merge of row collections
pub mod flatten;     // Nested JSON <-> dotted-path maps
pub mod csv_export;  // Flat JSON rows to CSV
pub mod validators;  // CPF/CNPJ checksums + dispatcher + form rule
pub mod formatters;  // Tax-id display punctuation

// Re-export commonly used types and functions
pub use cycles::{
    BaseAmount, Cycle, LineEntry,
    group_cycles, ungroup_cycles,
};
pub use reconcile::{
    Change, ChangeAction,
    compare_arrays_of_objects_with_id, merge_by_id,
};
pub use flatten::{flatten_object, unflatten_object};
pub use csv_export::convert_json_to_csv;
pub use validators::{
    validate_cnpj, validate_cpf, validate_vat_number, vat_number_rule,
};
pub use formatters::format_vat_number;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
