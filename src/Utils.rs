/// Loading and saving of kinetic task documents: plain-text files with a
/// SUBSTANCES section (comma-separated names) and a REACTIONS section (JSON
/// payload), with detailed error reporting for malformed documents.
pub mod load_from_file;
