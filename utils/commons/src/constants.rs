/// Tag for the Custom Offered event.
pub const OFFERED_TAG: u8 = u8::MAX - 1;

/// Tag for the Custom Bought event.
pub const BOUGHT_TAG: u8 = u8::MAX - 2;
