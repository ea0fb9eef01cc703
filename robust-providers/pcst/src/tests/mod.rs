mod prune;
mod support;
