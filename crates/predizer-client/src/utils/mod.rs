pub mod const_settings;
