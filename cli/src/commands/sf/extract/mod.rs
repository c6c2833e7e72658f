//! Commands that pull information out of project metadata.
