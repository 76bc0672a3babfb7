pub(crate) mod mlt_xml;
