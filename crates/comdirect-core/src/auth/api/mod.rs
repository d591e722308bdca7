pub(crate) mod request;
