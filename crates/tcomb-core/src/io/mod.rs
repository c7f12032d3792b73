pub mod image_io;
pub mod y4m;
pub mod y4m_writer;
