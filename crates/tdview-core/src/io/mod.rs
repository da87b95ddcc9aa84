pub mod experiment;
pub mod image_io;
pub mod tdms;
pub mod tdms_writer;
