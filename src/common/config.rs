/// Number of component descriptors the descriptor list grows by in one step
pub const COMPONENT_CHUNK: usize = 20;

/// Largest width (in bytes) of a symbolic component.
/// Legacy type codes up to and including this value denote symbolic widths.
pub const MAX_SYMBOLIC_WIDTH: usize = 256;

/// Maximum length of a component name in bytes
pub const MAX_COMPONENT_NAME_LEN: usize = 254;

/// Number of records rendered by the table printer before eliding the rest
pub const PRINT_ROW_LIMIT: usize = 40;
