//! 对象缓存插件体系
//!
//! 缓存后端以插件形式注册（moka / redis），启动时按配置选择。

pub mod object_cache;
pub mod register;
mod traits;

pub use traits::{CacheResult, ObjectCache};

/// 注册一个对象缓存插件，进程启动时自动执行
#[macro_export]
macro_rules! declare_object_cache_plugin {
    ($name:literal, $type:ty) => {
        paste::paste! {
            #[ctor::ctor]
            fn [<__register_object_cache_plugin_ $type:snake>]() {
                $crate::cache::register::register_object_cache_plugin(
                    $name,
                    std::sync::Arc::new(|| {
                        Box::pin(async {
                            let cache = <$type>::new()
                                .map_err($crate::errors::EvalHubError::cache_connection)?;
                            Ok(Box::new(cache) as Box<dyn $crate::cache::ObjectCache>)
                        })
                    }),
                );
            }
        }
    };
}
