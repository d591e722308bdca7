mod trace_middleware;

pub(crate) use trace_middleware::TraceMiddleware;
