// Drawing: the surface capability, the PDF backend behind it, and the two
// things drawn on it (quote cards and the cut-guide jig).

pub mod card;
pub mod jig;
pub mod pdf;
#[cfg(test)]
pub mod recording;
pub mod surface;
